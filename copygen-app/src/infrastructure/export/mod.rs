mod csv_export;

pub use csv_export::{csv_data_uri, download_file_name, to_csv_bytes, UTF8_BOM};
