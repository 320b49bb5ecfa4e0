mod fibonacci;
mod framework;
mod is_zero;
