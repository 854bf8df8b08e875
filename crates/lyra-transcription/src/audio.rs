//! Decoding of downloaded track audio into 16kHz mono f32 PCM.

use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::types::{ResultExt, TranscriptionError};

/// Sample rate the speech model expects.
pub const MODEL_SAMPLE_RATE: u32 = 16_000;

/// Decode an encoded audio blob into mono f32 PCM at [`MODEL_SAMPLE_RATE`].
///
/// The blob is whatever the downloader produced (typically M4A/AAC);
/// symphonia probes the container, so other formats decode too. Multi-
/// channel audio is averaged down to mono before resampling.
pub fn pcm_for_model(blob: &[u8]) -> Result<Vec<f32>, TranscriptionError> {
    let stream = MediaSourceStream::new(Box::new(Cursor::new(blob.to_vec())), Default::default());
    let mut hint = Hint::new();
    let _ = hint.with_extension("m4a");

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .transcription("audio probe")?;
    let mut reader = probed.format;

    let track = reader
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| TranscriptionError::TranscriptionFailed("no audio track in blob".into()))?;
    let track_id = track.id;
    let params = track.codec_params.clone();
    let source_rate = params.sample_rate.unwrap_or(MODEL_SAMPLE_RATE);
    let channels = params.channels.map_or(1, |c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&params, &DecoderOptions::default())
        .transcription("codec init")?;

    let mut pcm: Vec<f32> = Vec::new();
    loop {
        let packet = match reader.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e).transcription("packet read"),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).transcription("decode")?;
        let spec = *decoded.spec();
        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);

        if channels > 1 {
            for frame in buf.samples().chunks(channels) {
                pcm.push(frame.iter().sum::<f32>() / channels as f32);
            }
        } else {
            pcm.extend_from_slice(buf.samples());
        }
    }

    if pcm.is_empty() {
        return Err(TranscriptionError::TranscriptionFailed(
            "blob decoded to zero samples".into(),
        ));
    }

    if source_rate == MODEL_SAMPLE_RATE {
        Ok(pcm)
    } else {
        resample(&pcm, source_rate, MODEL_SAMPLE_RATE)
    }
}

/// Sinc resampling of mono PCM between sample rates.
fn resample(pcm: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, TranscriptionError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let ratio = f64::from(to_rate) / f64::from(from_rate);
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .transcription("resampler init")?;

    let mut out = Vec::with_capacity((pcm.len() as f64 * ratio) as usize + chunk_size);
    for chunk in pcm.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            vec![padded]
        } else {
            vec![chunk.to_vec()]
        };
        let resampled = resampler.process(&input, None).transcription("resample")?;
        if let Some(channel) = resampled.first() {
            out.extend_from_slice(channel);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_blob_fails_to_probe() {
        assert!(pcm_for_model(b"definitely not audio").is_err());
    }

    #[test]
    fn empty_blob_fails() {
        assert!(pcm_for_model(b"").is_err());
    }

    #[test]
    fn resample_preserves_duration() {
        // 1s at 48kHz should land near 16k samples after resampling
        let pcm: Vec<f32> = (0..48_000).map(|i| (i as f32 / 48_000.0).sin()).collect();
        let out = resample(&pcm, 48_000, 16_000).unwrap();
        let ratio = out.len() as f64 / 16_000.0;
        assert!((ratio - 1.0).abs() < 0.05, "ratio: {ratio}");
    }

    #[test]
    fn wav_blob_decodes_to_mono_model_rate() {
        // 0.5s of 44.1kHz stereo silence should come out near 8000
        // mono samples at the model rate
        let wav = synth_wav(44_100, 2, 22_050);
        let pcm = pcm_for_model(&wav).unwrap();
        assert!(!pcm.is_empty());
        let ratio = pcm.len() as f64 / 8_000.0;
        assert!((ratio - 1.0).abs() < 0.2, "got {} samples", pcm.len());
        assert!(pcm.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }

    #[test]
    fn wav_blob_at_model_rate_skips_resampling() {
        let wav = synth_wav(16_000, 1, 1_600);
        let pcm = pcm_for_model(&wav).unwrap();
        assert_eq!(pcm.len(), 1_600);
    }

    /// Minimal PCM WAV container full of silence.
    fn synth_wav(sample_rate: u32, channels: u16, num_samples: u32) -> Vec<u8> {
        let bits: u16 = 16;
        let byte_rate = sample_rate * u32::from(channels) * u32::from(bits) / 8;
        let block_align = channels * bits / 8;
        let data_size = num_samples * u32::from(channels) * u32::from(bits) / 8;

        let mut buf = Vec::with_capacity(data_size as usize + 44);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_size).to_le_bytes());
        buf.extend_from_slice(b"WAVE");
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&channels.to_le_bytes());
        buf.extend_from_slice(&sample_rate.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        buf.resize(buf.len() + data_size as usize, 0);
        buf
    }
}
