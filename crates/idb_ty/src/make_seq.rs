use idb_index::FunctionIndex;
use serde::{Deserialize, Serialize};

/// A list accessor synthesized from a count function and an indexed getter.
/// Iterating it means `element_getter(i)` for `i in 0..num_getter()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MakeSeqRecord {
    pub seq_name: String,
    pub scoped_name: String,
    #[serde(default)]
    pub comment: Option<String>,
    pub num_name: String,
    pub element_name: String,
    pub num_getter: FunctionIndex,
    pub element_getter: FunctionIndex,
}
