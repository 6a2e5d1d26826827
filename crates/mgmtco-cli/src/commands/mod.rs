pub mod budget;
pub mod goal_seek;
pub mod scenarios;
