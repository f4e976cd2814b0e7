/// Parameters for converting one video file
#[derive(Debug, Clone)]
pub struct ConversionParams {
    pub input: String,
    pub output: String,
    pub crf: u8,
}

/// Build FFmpeg arguments for the H.264/AAC MP4 conversion.
///
/// Argument order is part of the encoder contract:
/// `-i <input> -c:v libx264 -crf <N> -c:a aac -y <output>`.
pub fn build_ffmpeg_args(params: &ConversionParams) -> Vec<String> {
    vec![
        "-i".to_string(),
        params.input.clone(),
        "-c:v".to_string(),
        "libx264".to_string(),
        "-crf".to_string(),
        params.crf.to_string(),
        "-c:a".to_string(),
        "aac".to_string(),
        "-y".to_string(),
        params.output.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_follow_the_encoder_contract() {
        let params = ConversionParams {
            input: "/videos/clip.mkv".to_string(),
            output: "/out/clip_converted.mp4".to_string(),
            crf: 23,
        };

        assert_eq!(
            build_ffmpeg_args(&params),
            vec![
                "-i",
                "/videos/clip.mkv",
                "-c:v",
                "libx264",
                "-crf",
                "23",
                "-c:a",
                "aac",
                "-y",
                "/out/clip_converted.mp4",
            ]
        );
    }

    #[test]
    fn crf_bounds_are_rendered_verbatim() {
        let mut params = ConversionParams {
            input: "in.mp4".to_string(),
            output: "out.mp4".to_string(),
            crf: 0,
        };
        assert!(build_ffmpeg_args(&params).contains(&"0".to_string()));

        params.crf = 51;
        assert!(build_ffmpeg_args(&params).contains(&"51".to_string()));
    }
}
