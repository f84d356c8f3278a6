// Minimal smoke run of the effect pipeline without FFmpeg

use imageclip_factory::{
    clip::{Clip, Frame},
    effects::EffectRegistry,
    slideshow::render_frames,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎬 Testing Imageclip-Factory Core Functionality");

    // Test 1: Effect Registry
    println!("\n1. Testing Effect Registry...");
    let registry = EffectRegistry::new();
    let available = registry.available_effects();
    println!("   Available effects: {:?}", available);
    assert_eq!(available.len(), 5);

    // Test 2: Clip Creation
    println!("\n2. Testing Clip Creation...");
    let image = image::RgbImage::from_fn(301, 151, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let clip = Clip::from_frame(Frame::from_rgb(image), 2.0);
    println!("   Created clip: {}x{} ({}s)", clip.width(), clip.height(), clip.duration());

    // Test 3: Directives
    println!("\n3. Testing Effect Directives...");
    let directives = ["even_size", "center_foreground,160,90,40", "sparkle,1"];
    let (clip, reports) = registry.apply_directives(&clip, &directives, false)?;
    for report in &reports {
        println!("   {} -> {:?}", report.directive, report.outcome);
    }
    assert_eq!(clip.size(), (160, 90));

    // Test 4: Rendering
    println!("\n4. Testing Frame Rendering...");
    let frames = render_frames(&clip, 4.0)?;
    println!("   Rendered {} frames", frames.len());

    match frames[frames.len() / 2].save_png("minimal_test_output.png") {
        Ok(()) => println!("   📁 Output saved to: minimal_test_output.png"),
        Err(e) => println!("   ⚠️  Could not save file: {}", e),
    }

    println!("\n🎉 All checks passed! Imageclip-Factory core is working.");

    Ok(())
}
