use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{GrayImage, Luma, Rgb, RgbImage};
use meterdial::{
    binarize_dial, measure_blobs, order_digits, rectify_dial, red_marker_mask, BinarizeParams,
    DialRect, RedMaskParams,
};

fn fill(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, rgb: [u8; 3]) {
    for yy in y..y + h {
        for xx in x..x + w {
            img.put_pixel(xx, yy, Rgb(rgb));
        }
    }
}

/// 1280x960 meter-like photograph: grey face, five red marks, dark dial with
/// light bars standing in for digits.
fn make_photo_fixture() -> RgbImage {
    let mut img = RgbImage::from_fn(1280, 960, |x, y| {
        let v = 80 + ((x * 3 + y * 5) % 40) as u8;
        Rgb([v, v, v])
    });
    fill(&mut img, 600, 700, 40, 40, [210, 25, 30]);
    for x in [200u32, 420, 760, 980] {
        fill(&mut img, x, 300, 10, 36, [210, 25, 30]);
    }
    fill(&mut img, 150, 420, 980, 180, [25, 25, 25]);
    for k in 0..6u32 {
        fill(&mut img, 210 + 160 * k, 460, 40, 100, [235, 235, 235]);
    }
    img
}

fn bench_marker_mask(c: &mut Criterion) {
    let photo = make_photo_fixture();
    let params = RedMaskParams::default();
    c.bench_function("red_marker_mask_1280x960", |b| {
        b.iter(|| black_box(red_marker_mask(black_box(&photo), &params)))
    });
}

fn bench_measure_blobs(c: &mut Criterion) {
    let mask = red_marker_mask(&make_photo_fixture(), &RedMaskParams::default());
    c.bench_function("measure_blobs_1280x960", |b| {
        b.iter(|| {
            let blobs = measure_blobs(black_box(&mask), 20).expect("mask is binary");
            black_box(blobs)
        })
    });
}

fn bench_rectify(c: &mut Criterion) {
    let photo = make_photo_fixture();
    let gray = image::imageops::grayscale(&photo);
    let reference = [
        [620.0, 720.0],
        [765.0, 318.0],
        [205.0, 318.0],
        [985.0, 318.0],
        [425.0, 318.0],
    ];
    // Mild perspective: markers shifted unevenly.
    let detected = [
        [622.0, 724.0],
        [768.0, 316.0],
        [203.0, 321.0],
        [990.0, 314.0],
        [426.0, 320.0],
    ];
    let dial = DialRect {
        x: 150.0,
        y: 420.0,
        width: 980,
        height: 180,
    };
    c.bench_function("rectify_dial_980x180", |b| {
        b.iter(|| {
            let out = rectify_dial(black_box(&gray), &reference, &detected, &dial)
                .expect("fixture reference is not collinear");
            black_box(out)
        })
    });
}

fn bench_digit_stage(c: &mut Criterion) {
    let dial = GrayImage::from_fn(980, 180, |x, y| {
        let on = (40..140).contains(&y) && (x % 160) >= 60 && (x % 160) < 100;
        Luma([if on { 235 } else { 25 }])
    });
    let params = BinarizeParams::default();
    c.bench_function("binarize_measure_order_980x180", |b| {
        b.iter(|| {
            let bin = binarize_dial(black_box(&dial), &params);
            let blobs = measure_blobs(&bin, 10).expect("binarized dial is binary");
            black_box(order_digits(&blobs))
        })
    });
}

criterion_group!(
    hotpaths,
    bench_marker_mask,
    bench_measure_blobs,
    bench_rectify,
    bench_digit_stage
);
criterion_main!(hotpaths);
