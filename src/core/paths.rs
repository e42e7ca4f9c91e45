pub fn app_data_dir() -> Option<std::path::PathBuf> {
    if let Ok(dir) = std::env::var("DL_VIDEO_DATA_DIR") {
        return Some(std::path::PathBuf::from(dir));
    }
    dirs::data_dir().map(|d| d.join("dl-video"))
}

pub fn app_config_dir() -> Option<std::path::PathBuf> {
    if let Ok(dir) = std::env::var("DL_VIDEO_CONFIG_DIR") {
        return Some(std::path::PathBuf::from(dir));
    }
    dirs::config_dir().map(|d| d.join("dl-video"))
}

pub fn managed_bin_dir() -> Option<std::path::PathBuf> {
    app_data_dir().map(|d| d.join("bin"))
}
