pub mod add;
pub mod admin;
pub mod audit;
pub mod backup;
pub mod dispatch;
pub mod insights;
pub mod navigation;
pub mod schema;
pub mod shared;
pub mod update;
