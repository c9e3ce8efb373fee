pub mod pcm;
pub mod spectrum;
pub mod wav;
pub mod window;
