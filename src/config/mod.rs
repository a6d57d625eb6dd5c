pub mod setting;
pub mod utils;

pub use setting::{ProviderKind, ProviderSetting, Settings, StorageSetting, SETTINGS};
pub use utils::{get_config_dir, get_data_dir, get_settings_path};
