pub mod about;
pub mod controls;
pub mod dialogs;
pub mod info_panel;
pub mod map_view;

pub use about::AboutDialog;
pub use controls::ControlsWindow;
pub use dialogs::FileDialogs;
pub use info_panel::{PanelFrame, VehicleInfoPanel};
pub use map_view::{MapFrame, MapView};
