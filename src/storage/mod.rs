mod dedup;
mod table;

pub use dedup::{discover_data_files, filter_new, load_existing_ids, merge_files};
pub use table::{write_records, WriteMode};

#[cfg(test)]
pub use table::read_records;
