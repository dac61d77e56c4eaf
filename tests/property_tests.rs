use image::ImageFormat;
use img_press::{is_eligible_file, quality_from_strength, ImagePayload, JpegCodec};
use proptest::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};

fn tiny_png() -> Vec<u8> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_fn(8, 8, |x, y| {
        image::Rgb([x as u8 * 30, y as u8 * 30, 99])
    }));
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}

proptest! {
    #[test]
    fn strength_inversion_stays_in_range(strength in 0u8..=100u8) {
        let quality = quality_from_strength(strength).unwrap();
        prop_assert!(quality <= 100);
        prop_assert_eq!(quality, 100 - strength);
    }

    #[test]
    fn strength_above_range_is_rejected(strength in 101u8..=255u8) {
        prop_assert!(quality_from_strength(strength).is_err());
    }

    #[test]
    fn every_valid_quality_encodes(quality in 0u8..=100u8) {
        let codec = JpegCodec::resolve().unwrap();
        let payload = ImagePayload::new(tiny_png(), PathBuf::from("tiny.png"));

        let encoded = codec.compress(payload, quality).unwrap();

        // Output must itself be a decodable JPEG.
        prop_assert_eq!(image::guess_format(&encoded).unwrap(), ImageFormat::Jpeg);
        prop_assert!(image::load_from_memory(&encoded).is_ok());
    }

    #[test]
    fn eligibility_follows_the_extension_set(
        stem in "[a-zA-Z0-9_-]{1,12}",
        extension in prop::sample::select(
            &["jpg", "jpeg", "png", "JPG", "PNG", "webp", "gif", "txt", "bmp", "tiff"]
        )
    ) {
        let filename = format!("{stem}.{extension}");
        let expected = matches!(
            extension.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png"
        );
        prop_assert_eq!(is_eligible_file(Path::new(&filename)), expected);
    }

    #[test]
    fn extensionless_names_are_never_eligible(stem in "[a-zA-Z0-9_-]{1,12}") {
        prop_assert!(!is_eligible_file(Path::new(&stem)));
    }
}
