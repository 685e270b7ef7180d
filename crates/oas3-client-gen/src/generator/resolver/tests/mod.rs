mod cycles;
mod support;
