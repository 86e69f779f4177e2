mod navigation;
mod properties;
