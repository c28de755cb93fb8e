pub mod answer_box;
pub mod menu;
pub mod problem_card;
pub mod story_card;
