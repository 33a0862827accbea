pub mod agent;
pub mod events;
pub mod outreach;
pub mod webhook;
