use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::Rng;
use std::hint::black_box;

use imgkit_image::Image;
use imgkit_imgproc::histogram::{hist_float, hist_int, hist_percentiles_f32};

// vanilla version
fn hist_u16_sequential(src: &Image<u16, 1>) -> Vec<u64> {
    let mut counts = vec![0u64; 1 << 16];
    src.as_slice().iter().for_each(|&v| counts[v as usize] += 1);
    counts
}

fn bench_histogram(c: &mut Criterion) {
    let mut group = c.benchmark_group("Histogram");
    let mut rng = rand::rng();

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{width}x{height}");
        let size = [*width, *height].into();

        let data_u16 = (0..width * height)
            .map(|_| rng.random_range(0..4096u16))
            .collect();
        let image_u16 = Image::<u16, 1>::new(size, data_u16).unwrap();

        let data_f32 = (0..width * height)
            .map(|_| rng.random_range(0.0..1000.0f32))
            .collect();
        let image_f32 = Image::<f32, 1>::new(size, data_f32).unwrap();

        group.bench_with_input(
            BenchmarkId::new("u16_sequential", &parameter_string),
            &image_u16,
            |b, i| b.iter(|| black_box(hist_u16_sequential(i))),
        );

        group.bench_with_input(
            BenchmarkId::new("u16_parallel", &parameter_string),
            &image_u16,
            |b, i| b.iter(|| black_box(hist_int(i))),
        );

        group.bench_with_input(
            BenchmarkId::new("f32_256_bins", &parameter_string),
            &image_f32,
            |b, i| b.iter(|| black_box(hist_float(i, 256, None, None).unwrap())),
        );

        group.bench_with_input(
            BenchmarkId::new("f32_percentiles", &parameter_string),
            &image_f32,
            |b, i| b.iter(|| black_box(hist_percentiles_f32(i, 1.0, 99.0).unwrap())),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_histogram);
criterion_main!(benches);
