mod common;
mod intents;
