mod lowering;
mod rendering;
mod support;
