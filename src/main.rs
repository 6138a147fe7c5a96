use sandbox_terrain::image::{ChannelOrder, ColorImage, DepthImage};
use sandbox_terrain::{ClassifierParams, TerrainClassifier};

fn main() {
    // Demo: a synthetic 320x240 sand table with one block, a road strip and
    // a park patch, classified with default parameters.
    let (w, h) = (320usize, 240usize);
    let mut depth = vec![300u16; w * h];
    let mut rgb = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let block = (140..170).contains(&x) && (60..90).contains(&y);
            let road = (20..300).contains(&x) && (180..196).contains(&y);
            let park = (30..90).contains(&x) && (40..100).contains(&y);
            if block {
                depth[y * w + x] = 340;
            }
            let px: [u8; 3] = if road {
                [60, 60, 60]
            } else if park {
                [40, 160, 50]
            } else {
                [210, 200, 170]
            };
            rgb.extend_from_slice(&px);
        }
    }

    let classifier = TerrainClassifier::new(ClassifierParams::default());
    let depth = DepthImage::new(w, h, &depth);
    let color = ColorImage::new(w, h, ChannelOrder::Rgb, &rgb);
    match classifier.classify_with_diagnostics(&depth, &color, 0.001, None) {
        Ok(report) => {
            let s = &report.summary;
            println!(
                "buildings={} roads={} parks={} latency_ms={:.3}",
                s.building_pixels, s.road_pixels, s.park_pixels, s.latency_ms
            );
        }
        Err(err) => eprintln!("Error: {err}"),
    }
}
