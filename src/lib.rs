pub mod app;
pub mod ledger;
pub mod payout;
pub mod reputation;
pub mod session;
pub mod ui;
pub mod wheel;
