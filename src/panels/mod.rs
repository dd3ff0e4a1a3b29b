pub mod app_list;
