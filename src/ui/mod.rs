pub mod icons;
pub mod output;
pub mod table;

pub use icons::Icons;
pub use output::{
    error, header, info, muted, palette, record_deleted, record_saved, section, success,
    summary_row, warn, Palette,
};
pub use table::{
    kv_table, record_rows, rows_table, AssetRow, HistoryRow, ScreenRow, StoreRow, TableBuilder,
};
