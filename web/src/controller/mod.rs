pub(crate) mod health_check_controller;
pub(crate) mod meeting_controller;
pub(crate) mod not_found_controller;
