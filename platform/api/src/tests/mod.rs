mod api;
mod global;
mod pagination;
mod simulation;
