use idb_index::{FunctionIndex, MakeSeqIndex};

use super::Database;

impl Database {
    pub fn make_seq_seq_name(&self, make_seq: MakeSeqIndex) -> &str {
        self.make_seq(make_seq)
            .map_or("", |record| record.seq_name.as_str())
    }

    pub fn make_seq_scoped_name(&self, make_seq: MakeSeqIndex) -> &str {
        self.make_seq(make_seq)
            .map_or("", |record| record.scoped_name.as_str())
    }

    pub fn make_seq_has_comment(&self, make_seq: MakeSeqIndex) -> bool {
        self.make_seq(make_seq)
            .is_some_and(|record| record.comment.is_some())
    }

    pub fn make_seq_comment(&self, make_seq: MakeSeqIndex) -> &str {
        self.make_seq(make_seq)
            .and_then(|record| record.comment.as_deref())
            .unwrap_or_default()
    }

    /// Name of the count method, as written in the class.
    pub fn make_seq_num_name(&self, make_seq: MakeSeqIndex) -> &str {
        self.make_seq(make_seq)
            .map_or("", |record| record.num_name.as_str())
    }

    pub fn make_seq_element_name(&self, make_seq: MakeSeqIndex) -> &str {
        self.make_seq(make_seq)
            .map_or("", |record| record.element_name.as_str())
    }

    pub fn make_seq_num_getter(&self, make_seq: MakeSeqIndex) -> Option<FunctionIndex> {
        self.make_seq(make_seq).map(|record| record.num_getter)
    }

    pub fn make_seq_element_getter(&self, make_seq: MakeSeqIndex) -> Option<FunctionIndex> {
        self.make_seq(make_seq)
            .map(|record| record.element_getter)
    }
}
