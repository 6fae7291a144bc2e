use std::path::Path;

/// Build FFmpeg arguments that decode the audio track of `input` into a
/// 16-bit stereo WAV file.
pub fn build_audio_extract_args(input: &str, output: &Path) -> Vec<String> {
    vec![
        "-y".to_string(),
        "-i".to_string(),
        input.to_string(),
        "-vn".to_string(),
        "-acodec".to_string(),
        "pcm_s16le".to_string(),
        "-ar".to_string(),
        "44100".to_string(),
        "-ac".to_string(),
        "2".to_string(),
        output.to_string_lossy().to_string(),
    ]
}

/// Build FFmpeg arguments for a real-time paced raw RGBA frame stream on stdout.
pub fn build_frame_stream_args(input: &str, start_secs: f64, width: u32, height: u32, fps: u32) -> Vec<String> {
    vec![
        "-re".to_string(),
        "-ss".to_string(),
        format!("{:.3}", start_secs),
        "-i".to_string(),
        input.to_string(),
        "-an".to_string(),
        "-vf".to_string(),
        format!("scale={}:{},fps={}", width, height, fps),
        "-f".to_string(),
        "rawvideo".to_string(),
        "-pix_fmt".to_string(),
        "rgba".to_string(),
        "pipe:1".to_string(),
    ]
}

/// Build FFmpeg arguments that write a single JPEG frame to stdout.
pub fn build_poster_args(input: &str, max_width: u32) -> Vec<String> {
    vec![
        "-ss".to_string(),
        "0".to_string(),
        "-i".to_string(),
        input.to_string(),
        "-vframes".to_string(),
        "1".to_string(),
        "-vf".to_string(),
        format!("scale='min({},iw)':-2", max_width),
        "-f".to_string(),
        "image2pipe".to_string(),
        "-vcodec".to_string(),
        "mjpeg".to_string(),
        "pipe:1".to_string(),
    ]
}
