pub mod event;
pub mod patch;
pub mod summary;
pub mod work_item;
