//! mag-core: almacén de salida versionado y direccionado por contenido.
//!
//! Decide dónde aterriza cada fichero ingerido, si es un duplicado, cómo se
//! versiona cuando su contenido cambia y cómo se refleja la decisión en el
//! catálogo persistido.
//!
//! Módulos:
//! - `descriptor`: contrato `MetadataDescriptor` y variantes incluidas.
//! - `paths`: ensamblado de rutas destino.
//! - `store`: `OutputStore` y su implementación sobre el filesystem.
//! - `catalog`: contrato `Catalog` y backend en memoria.
//! - `recorder`: decorador que verifica integridad e indexa en el catálogo.
pub mod catalog;
pub mod constants;
pub mod descriptor;
pub mod errors;
pub mod hashing;
pub mod paths;
pub mod recorder;
pub mod store;

pub use catalog::{Catalog, FileRecord, InMemoryCatalog, NewFile};
pub use constants::SOFTWARE_VERSION;
pub use descriptor::{DefaultDescriptor, DefaultDescriptorBuilder, FixedDescriptor, MetadataDescriptor};
pub use errors::{DescriptorError, StoreError};
pub use paths::assemble;
pub use recorder::IndexRecorder;
pub use store::{FsOutputStore, OutputStore, Placement, PlacementOutcome};
