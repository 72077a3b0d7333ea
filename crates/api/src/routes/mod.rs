pub mod health;
pub mod kickoff;
pub mod notification;
pub mod proposal;
pub mod pursuit;
