// Engine modules: fixed-step loop, input, collision geometry

pub mod game_loop;
pub mod input;
pub mod physics;
