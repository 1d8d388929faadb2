use rfd::FileDialog;
use std::path::PathBuf;

/// File dialog helper for route data
pub struct FileDialogs;

impl FileDialogs {
    /// Open a file dialog for selecting a route file
    pub fn open_route_file() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("Route Files", &["json", "csv"])
            .add_filter("All Files", &["*"])
            .set_title("Open Route")
            .pick_file()
    }

    /// Open a file dialog for selecting a day list
    pub fn open_days_file() -> Option<PathBuf> {
        FileDialog::new()
            .add_filter("JSON Files", &["json"])
            .set_title("Open Day List")
            .pick_file()
    }
}
