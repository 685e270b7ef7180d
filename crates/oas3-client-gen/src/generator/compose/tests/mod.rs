mod all_of;
mod support;
