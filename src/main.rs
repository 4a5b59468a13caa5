use house_segment::utils::input::{confirm, read_form};
use house_segment::utils::plot::create_probability_chart;
use house_segment::{AppConfig, AppContext, SegmentError};
use std::error::Error;
use std::io;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();

    // Load dataset, scaler and model once
    let ctx = match AppContext::load(&config) {
        Ok(ctx) => ctx,
        Err(e) => {
            println!("Cannot start the predictor ({}): {}", e.kind(), e);
            return Ok(());
        }
    };

    println!("House segment predictor - Ho Chi Minh City");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        let form = match read_form(&mut input, ctx.districts()) {
            Ok(form) => form,
            Err(SegmentError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Err(e @ SegmentError::InvalidInput { .. }) => {
                println!("{e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        println!("Computed unit price: {:.2} million VND/m²", form.unit_price());

        match ctx.predict(&form) {
            Ok(prediction) => {
                prediction.display();
                if let (Some(path), Some(probabilities)) = (&config.chart_path, &prediction.probabilities) {
                    match create_probability_chart(probabilities, path) {
                        Ok(()) => println!("Chart saved to {}", path.display()),
                        Err(e) => log::warn!("could not draw chart: {e}"),
                    }
                }
            }
            Err(e) => println!("Prediction failed ({}): {}", e.kind(), e),
        }

        if !confirm(&mut input, "\nPredict another house?")? {
            break;
        }
    }

    Ok(())
}
