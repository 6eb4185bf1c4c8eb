mod lifecycle_manager;
mod router;
