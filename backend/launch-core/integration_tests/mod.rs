mod application;
mod helpers;
mod instance;
mod messaging;
