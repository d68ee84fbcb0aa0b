//! Static table of well-known JDK symbols, consulted after the resolver's
//! priority chain misses. Not exhaustive — covers `java.lang`, the common
//! collection/util types, and a handful of annotation/exception types that
//! show up constantly in ordinary application code.

use std::sync::LazyLock;

use codegraph_core::ElementKind;

pub struct BuiltinEntry {
    pub qualified_name: &'static str,
    pub kind: ElementKind,
}

macro_rules! builtins {
    ($( $short:literal => ($qn:literal, $kind:expr) ),* $(,)?) => {
        LazyLock::new(|| {
            let mut m = std::collections::HashMap::new();
            $( m.insert($short, BuiltinEntry { qualified_name: $qn, kind: $kind }); )*
            m
        })
    };
}

pub static BUILTINS: LazyLock<std::collections::HashMap<&'static str, BuiltinEntry>> = builtins! {
    // java.lang
    "Object" => ("java.lang.Object", ElementKind::Class),
    "String" => ("java.lang.String", ElementKind::Class),
    "StringBuilder" => ("java.lang.StringBuilder", ElementKind::Class),
    "StringBuffer" => ("java.lang.StringBuffer", ElementKind::Class),
    "Integer" => ("java.lang.Integer", ElementKind::Class),
    "Long" => ("java.lang.Long", ElementKind::Class),
    "Short" => ("java.lang.Short", ElementKind::Class),
    "Byte" => ("java.lang.Byte", ElementKind::Class),
    "Double" => ("java.lang.Double", ElementKind::Class),
    "Float" => ("java.lang.Float", ElementKind::Class),
    "Boolean" => ("java.lang.Boolean", ElementKind::Class),
    "Character" => ("java.lang.Character", ElementKind::Class),
    "Number" => ("java.lang.Number", ElementKind::Class),
    "Void" => ("java.lang.Void", ElementKind::Class),
    "Math" => ("java.lang.Math", ElementKind::Class),
    "System" => ("java.lang.System", ElementKind::Class),
    "Thread" => ("java.lang.Thread", ElementKind::Class),
    "Runnable" => ("java.lang.Runnable", ElementKind::Interface),
    "Comparable" => ("java.lang.Comparable", ElementKind::Interface),
    "Iterable" => ("java.lang.Iterable", ElementKind::Interface),
    "CharSequence" => ("java.lang.CharSequence", ElementKind::Interface),
    "AutoCloseable" => ("java.lang.AutoCloseable", ElementKind::Interface),
    "Class" => ("java.lang.Class", ElementKind::Class),
    "Enum" => ("java.lang.Enum", ElementKind::Class),
    "Record" => ("java.lang.Record", ElementKind::Class),
    "Exception" => ("java.lang.Exception", ElementKind::Class),
    "RuntimeException" => ("java.lang.RuntimeException", ElementKind::Class),
    "Throwable" => ("java.lang.Throwable", ElementKind::Class),
    "Error" => ("java.lang.Error", ElementKind::Class),
    "NullPointerException" => ("java.lang.NullPointerException", ElementKind::Class),
    "IllegalArgumentException" => ("java.lang.IllegalArgumentException", ElementKind::Class),
    "IllegalStateException" => ("java.lang.IllegalStateException", ElementKind::Class),
    "IndexOutOfBoundsException" => ("java.lang.IndexOutOfBoundsException", ElementKind::Class),
    "UnsupportedOperationException" => ("java.lang.UnsupportedOperationException", ElementKind::Class),
    "ClassCastException" => ("java.lang.ClassCastException", ElementKind::Class),
    "NumberFormatException" => ("java.lang.NumberFormatException", ElementKind::Class),
    "InterruptedException" => ("java.lang.InterruptedException", ElementKind::Class),
    "Override" => ("java.lang.Override", ElementKind::Annotation),
    "Deprecated" => ("java.lang.Deprecated", ElementKind::Annotation),
    "SuppressWarnings" => ("java.lang.SuppressWarnings", ElementKind::Annotation),
    "FunctionalInterface" => ("java.lang.FunctionalInterface", ElementKind::Annotation),
    "SafeVarargs" => ("java.lang.SafeVarargs", ElementKind::Annotation),

    // java.util
    "List" => ("java.util.List", ElementKind::Interface),
    "ArrayList" => ("java.util.ArrayList", ElementKind::Class),
    "LinkedList" => ("java.util.LinkedList", ElementKind::Class),
    "Map" => ("java.util.Map", ElementKind::Interface),
    "HashMap" => ("java.util.HashMap", ElementKind::Class),
    "TreeMap" => ("java.util.TreeMap", ElementKind::Class),
    "LinkedHashMap" => ("java.util.LinkedHashMap", ElementKind::Class),
    "Set" => ("java.util.Set", ElementKind::Interface),
    "HashSet" => ("java.util.HashSet", ElementKind::Class),
    "TreeSet" => ("java.util.TreeSet", ElementKind::Class),
    "LinkedHashSet" => ("java.util.LinkedHashSet", ElementKind::Class),
    "Queue" => ("java.util.Queue", ElementKind::Interface),
    "Deque" => ("java.util.Deque", ElementKind::Interface),
    "ArrayDeque" => ("java.util.ArrayDeque", ElementKind::Class),
    "Collection" => ("java.util.Collection", ElementKind::Interface),
    "Iterator" => ("java.util.Iterator", ElementKind::Interface),
    "Optional" => ("java.util.Optional", ElementKind::Class),
    "Arrays" => ("java.util.Arrays", ElementKind::Class),
    "Collections" => ("java.util.Collections", ElementKind::Class),
    "Objects" => ("java.util.Objects", ElementKind::Class),
    "UUID" => ("java.util.UUID", ElementKind::Class),
    "Scanner" => ("java.util.Scanner", ElementKind::Class),
    "Random" => ("java.util.Random", ElementKind::Class),
    "Date" => ("java.util.Date", ElementKind::Class),
    "Comparator" => ("java.util.Comparator", ElementKind::Interface),
    "NoSuchElementException" => ("java.util.NoSuchElementException", ElementKind::Class),
    "ConcurrentModificationException" => ("java.util.ConcurrentModificationException", ElementKind::Class),

    // java.util.stream / java.util.function
    "Stream" => ("java.util.stream.Stream", ElementKind::Interface),
    "Collectors" => ("java.util.stream.Collectors", ElementKind::Class),
    "IntStream" => ("java.util.stream.IntStream", ElementKind::Interface),
    "Function" => ("java.util.function.Function", ElementKind::Interface),
    "Supplier" => ("java.util.function.Supplier", ElementKind::Interface),
    "Consumer" => ("java.util.function.Consumer", ElementKind::Interface),
    "Predicate" => ("java.util.function.Predicate", ElementKind::Interface),
    "BiFunction" => ("java.util.function.BiFunction", ElementKind::Interface),

    // java.io / java.nio
    "IOException" => ("java.io.IOException", ElementKind::Class),
    "FileNotFoundException" => ("java.io.FileNotFoundException", ElementKind::Class),
    "UncheckedIOException" => ("java.io.UncheckedIOException", ElementKind::Class),
    "File" => ("java.io.File", ElementKind::Class),
    "InputStream" => ("java.io.InputStream", ElementKind::Class),
    "OutputStream" => ("java.io.OutputStream", ElementKind::Class),
    "Serializable" => ("java.io.Serializable", ElementKind::Interface),
    "Path" => ("java.nio.file.Path", ElementKind::Interface),
    "Paths" => ("java.nio.file.Paths", ElementKind::Class),
    "Files" => ("java.nio.file.Files", ElementKind::Class),

    // java.time
    "LocalDate" => ("java.time.LocalDate", ElementKind::Class),
    "LocalDateTime" => ("java.time.LocalDateTime", ElementKind::Class),
    "Instant" => ("java.time.Instant", ElementKind::Class),
    "Duration" => ("java.time.Duration", ElementKind::Class),

    // java.math / java.util.concurrent
    "BigInteger" => ("java.math.BigInteger", ElementKind::Class),
    "BigDecimal" => ("java.math.BigDecimal", ElementKind::Class),
    "AtomicInteger" => ("java.util.concurrent.atomic.AtomicInteger", ElementKind::Class),
    "AtomicLong" => ("java.util.concurrent.atomic.AtomicLong", ElementKind::Class),
    "ConcurrentHashMap" => ("java.util.concurrent.ConcurrentHashMap", ElementKind::Class),
    "ExecutorService" => ("java.util.concurrent.ExecutorService", ElementKind::Interface),
    "Executors" => ("java.util.concurrent.Executors", ElementKind::Class),
    "Future" => ("java.util.concurrent.Future", ElementKind::Interface),
    "CompletableFuture" => ("java.util.concurrent.CompletableFuture", ElementKind::Class),
    "TimeUnit" => ("java.util.concurrent.TimeUnit", ElementKind::Enum),

    // java.lang.annotation
    "Retention" => ("java.lang.annotation.Retention", ElementKind::Annotation),
    "Target" => ("java.lang.annotation.Target", ElementKind::Annotation),
    "Documented" => ("java.lang.annotation.Documented", ElementKind::Annotation),
    "Inherited" => ("java.lang.annotation.Inherited", ElementKind::Annotation),
    "Repeatable" => ("java.lang.annotation.Repeatable", ElementKind::Annotation),
    "RetentionPolicy" => ("java.lang.annotation.RetentionPolicy", ElementKind::Enum),
    "ElementType" => ("java.lang.annotation.ElementType", ElementKind::Enum),
};

pub fn lookup(short_name: &str) -> Option<&'static BuiltinEntry> {
    BUILTINS.get(short_name)
}
