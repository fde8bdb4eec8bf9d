pub mod audio_fixtures;
