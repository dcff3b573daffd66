pub const LOG_FORMATS: [&str; 3] = ["pretty", "json", "compact"];

pub fn default_service_name() -> String {
    "NCIF Data Integration API".to_string()
}

pub fn default_service_version() -> String {
    "1.0.0".to_string()
}

pub fn default_database_path() -> String {
    "data/merged_data.db".to_string()
}

pub fn default_max_connections() -> u32 {
    4
}

pub fn default_http_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_http_port() -> u16 {
    8000
}

pub fn default_workbook_path() -> String {
    "data/20241125 Case Study for Position SE_Data.xlsx".to_string()
}

pub fn default_air_quality_sheet_name() -> String {
    "AirQuality_EPA_IL".to_string()
}

pub fn default_tract_column() -> String {
    "census_tract".to_string()
}

pub fn default_air_quality_value_column() -> String {
    "arithmetic_mean".to_string()
}

pub fn default_bank_sheet() -> super::BranchSheetConfig {
    super::BranchSheetConfig {
        sheet: "SOD_IL_2024".to_string(),
        tract_column: default_tract_column(),
    }
}

pub fn default_credit_union_sheet() -> super::BranchSheetConfig {
    super::BranchSheetConfig {
        sheet: "NCUA_IL_Q2_2024".to_string(),
        tract_column: "census tract".to_string(),
    }
}

pub fn default_api_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

pub fn default_output_dir() -> String {
    "charts".to_string()
}

pub fn default_pm25_threshold() -> f64 {
    10.0
}

pub fn default_branch_threshold() -> i64 {
    5
}

pub fn default_histogram_bins() -> usize {
    20
}

pub fn default_request_timeout_seconds() -> u64 {
    30
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}
