//! A small CPU path tracer for scenes made of spheres.
//!
//! The pieces fit together as camera -> ray -> scene/material -> color: the
//! [`camera::Camera`] produces primary rays, [`scene::Scene::ray_color`] follows each
//! one through the scene, and [`render::render`] averages many such samples per pixel.
pub mod camera;
pub mod geom;
pub mod material;
pub mod output;
pub mod progress;
pub mod render;
pub mod scene;
pub mod surfaces;
pub mod trace;
pub mod util;
