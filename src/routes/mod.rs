pub mod auto_tag;
pub mod cors;
pub mod export;
pub mod health;
pub mod memo;
pub mod search;
pub mod todo;
pub mod user;
