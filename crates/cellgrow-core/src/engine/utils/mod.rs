pub mod radii;
