pub mod spreadsheet_gateway;
