pub mod stage_view;
