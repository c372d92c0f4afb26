pub mod event_log;
pub mod home;
pub mod languages_download;
pub mod languages_preference;
pub mod settings;
pub mod tabs;
