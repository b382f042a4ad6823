//! Decode every PDF417 symbol in an image file and print the results as
//! JSON lines.
//!
//! ```text
//! cargo run --example decode_image -- photo.png
//! ```

use pdf417_scan::{decode, BitMatrix};

fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .expect("usage: decode_image <image-file>");
    let gray = image::open(&path).expect("open image").to_luma8();

    // A fixed threshold is enough for clean scans; difficult inputs should
    // be binarized with Otsu before handing the matrix over.
    let bitmap = BitMatrix::from_fn(gray.width() as usize, gray.height() as usize, |x, y| {
        gray.get_pixel(x as u32, y as u32)[0] < 128
    });

    let results = decode(&bitmap);
    eprintln!("{}: {} barcode(s)", path, results.len());
    for barcode in &results {
        println!("{}", serde_json::to_string(barcode).expect("serialize"));
        eprintln!("  text: {}", barcode.text());
    }
}
