pub(crate) mod access;
pub(crate) mod error;
pub(crate) mod extract;
pub(crate) mod floorplans;
pub(crate) mod handlers;
pub(crate) mod projects;
pub(crate) mod rooms;
pub(crate) mod users;
