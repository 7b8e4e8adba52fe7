mod grid;

pub use grid::GridServiceImpl;
