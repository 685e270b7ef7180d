mod pointer;
mod support;
