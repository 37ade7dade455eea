// Vision analysis: trait-based abstraction over the image annotation provider.
//
// The VisionClient trait defines the interface. GoogleVisionClient implements
// it using the Cloud Vision `images:annotate` endpoint. The batch pipeline and
// the web handlers only ever see the trait.

pub mod traits;
pub mod google;
pub mod rate_limiter;
