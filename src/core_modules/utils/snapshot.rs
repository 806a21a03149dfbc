pub mod snapshot {
    use crate::core_modules::preprocessor::IntensityBuffer;
    use image::ImageEncoder;
    use std::path::Path;

    /// Writes the working intensity buffer as a grayscale PNG. Debug aid for
    /// the demo runner; nothing in the frame pipeline depends on it.
    pub fn save_intensity(
        buffer: &IntensityBuffer,
        path: &Path,
    ) -> Result<(), image::error::ImageError> {
        let output = std::fs::File::create(path)?;
        let encoder = image::codecs::png::PngEncoder::new(output);

        encoder.write_image(
            &buffer.data,
            buffer.width,
            buffer.height,
            image::ExtendedColorType::L8,
        )?;

        Ok(())
    }
}
