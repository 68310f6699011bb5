mod yaml_store;

pub use yaml_store::{parse_record, RejectedFile, StoreScan, YamlStore};
