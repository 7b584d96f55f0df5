pub mod logged_user;
