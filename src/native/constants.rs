//! Product types, file types and extension tables of the native project format.

use std::collections::HashMap;
use std::sync::LazyLock;

pub const APPLICATION: &str = "com.apple.product-type.application";
pub const FRAMEWORK: &str = "com.apple.product-type.framework";
pub const STATIC_LIBRARY: &str = "com.apple.product-type.library.static";
pub const APP_EXTENSION: &str = "com.apple.product-type.app-extension";

/// Maps file extensions to their `lastKnownFileType` identifier.
static FILE_TYPES_BY_EXTENSION: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut m = HashMap::new();
        m.insert("a", "archive.ar");
        m.insert("app", "wrapper.application");
        m.insert("appex", "wrapper.app-extension");
        m.insert("bundle", "wrapper.plug-in");
        m.insert("c", "sourcecode.c.c");
        m.insert("cc", "sourcecode.cpp.cpp");
        m.insert("cpp", "sourcecode.cpp.cpp");
        m.insert("cxx", "sourcecode.cpp.cpp");
        m.insert("dylib", "compiled.mach-o.dylib");
        m.insert("entitlements", "text.plist.entitlements");
        m.insert("framework", "wrapper.framework");
        m.insert("h", "sourcecode.c.h");
        m.insert("hpp", "sourcecode.cpp.h");
        m.insert("intentdefinition", "file.intentdefinition");
        m.insert("jpg", "image.jpeg");
        m.insert("json", "text.json");
        m.insert("m", "sourcecode.c.objc");
        m.insert("metal", "sourcecode.metal");
        m.insert("mm", "sourcecode.cpp.objcpp");
        m.insert("plist", "text.plist.xml");
        m.insert("png", "image.png");
        m.insert("s", "sourcecode.asm");
        m.insert("sh", "text.script.sh");
        m.insert("storyboard", "file.storyboard");
        m.insert("strings", "text.plist.strings");
        m.insert("stringsdict", "text.plist.stringsdict");
        m.insert("swift", "sourcecode.swift");
        m.insert("tbd", "sourcecode.text-based-dylib-definition");
        m.insert("xcassets", "folder.assetcatalog");
        m.insert("xcconfig", "text.xcconfig");
        m.insert("xcdatamodeld", "wrapper.xcdatamodeld");
        m.insert("xcodeproj", "wrapper.pb-project");
        m.insert("xctest", "wrapper.cfbundle");
        m.insert("xib", "file.xib");
        m
    });

pub fn file_type_for_extension(extension: &str) -> Option<&'static str> {
    FILE_TYPES_BY_EXTENSION.get(extension).copied()
}

/// Extension of the product built by a product type; `Some("")` for
/// command-line tools.
pub fn product_extension(product_type: &str) -> Option<&'static str> {
    let suffix = product_type.strip_prefix(crate::spec::target::PRODUCT_TYPE_PREFIX)?;
    match suffix {
        "application"
        | "application.watchapp"
        | "application.watchapp2"
        | "application.watchapp2-container"
        | "application.messages" => Some("app"),
        "app-extension"
        | "app-extension.messages"
        | "watchkit-extension"
        | "watchkit2-extension"
        | "tv-app-extension"
        | "tv-broadcast-extension" => Some("appex"),
        "bundle" => Some("bundle"),
        "framework" | "framework.static" => Some("framework"),
        "library.dynamic" => Some("dylib"),
        "library.static" => Some("a"),
        "tool" => Some(""),
        "bundle.unit-test" | "bundle.ui-testing" => Some("xctest"),
        _ => None,
    }
}

/// Extensions compiled by the sources phase
pub fn is_compiled_source(extension: &str) -> bool {
    matches!(
        extension,
        "swift"
            | "m"
            | "mm"
            | "c"
            | "cc"
            | "cpp"
            | "cxx"
            | "s"
            | "metal"
            | "intentdefinition"
            | "xcdatamodeld"
    )
}

/// Whether a product type builds a framework
pub fn is_framework(product_type: &str) -> bool {
    product_type == FRAMEWORK || product_type.ends_with(".framework.static")
}
