pub mod completion;
pub mod openai;
pub mod tutor;
pub mod validator;
