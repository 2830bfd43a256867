//! Leaf page objects for the shared UI components.

mod collapsible;
mod dialog;
mod dropdown_menu;
mod form_control;
mod notification;
mod pagination;
mod select;
mod tabs;

pub use collapsible::Collapsible;
pub use dialog::{ConfirmationPopup, Dialog, DIALOG};
pub use dropdown_menu::DropdownMenu;
pub(crate) use form_control::press_enter;
pub use form_control::{
    Button, CheckboxField, CodelistList, DatetimeField, FormControl, FormField,
    InputField, RadioButtonGroup, Region,
};
pub use notification::Notification;
pub use pagination::Pagination;
pub use select::{MultiSelectMenu, SingleSelectMenu, TagSelectMenu, TreeSelectMenu};
pub use tabs::Tabs;
