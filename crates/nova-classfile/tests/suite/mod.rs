mod annotations;
mod fallback;
