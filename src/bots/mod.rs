pub mod delivery_bot;
